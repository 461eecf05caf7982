//! Fake organizational tree generation.
//!
//! Names are generated in parallel with Rayon; rows are inserted level by
//! level with multi-value INSERT statements inside a single transaction.

use civica_access::{AccessResult, DirectoryStore};
use civica_models::{EntityId, Level};
use fake::Fake;
use fake::faker::address::en::CityName;
use fake::faker::name::en::LastName;
use rayon::prelude::*;
use sqlx::{PgPool, Postgres, Transaction};
use std::time::Instant;

use super::models::{EntitySeed, TerritoryConfig};

const BATCH_SIZE: usize = 500;

/// Ids created per level by [`seed_territory`].
#[derive(Debug, Default)]
pub struct SeededTerritory {
    pub localidades: Vec<EntityId>,
    pub circuitos: Vec<EntityId>,
    pub escuelas: Vec<EntityId>,
    pub mesas: Vec<EntityId>,
}

pub fn generate_localidades(count: usize) -> Vec<EntitySeed> {
    (0..count)
        .into_par_iter()
        .map(|_| EntitySeed {
            name: CityName().fake(),
            parent_id: None,
        })
        .collect()
}

/// `per_parent` children of `level` for each parent, in parent order.
pub fn generate_children(level: Level, parents: &[EntityId], per_parent: usize) -> Vec<EntitySeed> {
    parents
        .par_iter()
        .flat_map_iter(|parent| {
            (1..=per_parent).map(move |n| EntitySeed {
                name: child_name(level, n),
                parent_id: Some(*parent),
            })
        })
        .collect()
}

fn child_name(level: Level, n: usize) -> String {
    match level {
        Level::Localidad => CityName().fake(),
        Level::Circuito => format!("Circuito {}", n),
        Level::Escuela => {
            let patron: String = LastName().fake();
            format!("Escuela N° {} {}", n, patron)
        }
        Level::Mesa => format!("Mesa {}", n),
    }
}

/// Generate and insert a whole tree in one transaction.
pub async fn seed_territory(
    db: &PgPool,
    config: &TerritoryConfig,
) -> Result<SeededTerritory, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!(
        "🗺️  Seeding {} localidades, {} circuitos, {} escuelas, {} mesas...",
        config.localidades,
        config.total_circuitos(),
        config.total_escuelas(),
        config.total_mesas()
    );

    let mut tx = db.begin().await?;

    let localidades =
        insert_entities(&mut tx, Level::Localidad, &generate_localidades(config.localidades))
            .await?;
    let circuitos = insert_entities(
        &mut tx,
        Level::Circuito,
        &generate_children(Level::Circuito, &localidades, config.circuitos_per_localidad),
    )
    .await?;
    let escuelas = insert_entities(
        &mut tx,
        Level::Escuela,
        &generate_children(Level::Escuela, &circuitos, config.escuelas_per_circuito),
    )
    .await?;
    let mesas = insert_entities(
        &mut tx,
        Level::Mesa,
        &generate_children(Level::Mesa, &escuelas, config.mesas_per_escuela),
    )
    .await?;

    tx.commit().await?;

    println!(
        "   ✓ Inserted {} entities in {:?}",
        localidades.len() + circuitos.len() + escuelas.len() + mesas.len(),
        start_time.elapsed()
    );

    Ok(SeededTerritory {
        localidades,
        circuitos,
        escuelas,
        mesas,
    })
}

async fn insert_entities(
    tx: &mut Transaction<'_, Postgres>,
    level: Level,
    rows: &[EntitySeed],
) -> Result<Vec<EntityId>, Box<dyn std::error::Error>> {
    let mut ids = Vec::with_capacity(rows.len());
    for chunk in rows.chunks(BATCH_SIZE) {
        ids.extend(insert_entities_chunk(tx, level, chunk).await?);
    }
    Ok(ids)
}

async fn insert_entities_chunk(
    tx: &mut Transaction<'_, Postgres>,
    level: Level,
    rows: &[EntitySeed],
) -> Result<Vec<EntityId>, Box<dyn std::error::Error>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let with_parent = level.parent().is_some();
    let mut query = if with_parent {
        format!("INSERT INTO {} (name, parent_id) VALUES ", level.table())
    } else {
        format!("INSERT INTO {} (name) VALUES ", level.table())
    };

    for i in 0..rows.len() {
        if i > 0 {
            query.push_str(", ");
        }
        if with_parent {
            query.push_str(&format!("(${}, ${})", i * 2 + 1, i * 2 + 2));
        } else {
            query.push_str(&format!("(${})", i + 1));
        }
    }
    query.push_str(" RETURNING id");

    let mut q = sqlx::query_scalar::<_, EntityId>(&query);
    for row in rows {
        q = q.bind(&row.name);
        if with_parent {
            q = q.bind(row.parent_id);
        }
    }

    let ids = q.fetch_all(&mut **tx).await?;
    Ok(ids)
}

/// Remove every organizational entity and the grants pointing at them.
pub async fn clear_territory(store: &dyn DirectoryStore) -> AccessResult<u64> {
    let start_time = Instant::now();
    println!("🗑️  Clearing territory...");

    let removed = store.clear_entities().await?;

    println!(
        "   ✓ Deleted {} entities in {:?}",
        removed,
        start_time.elapsed()
    );
    Ok(removed)
}
