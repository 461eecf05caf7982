//! Seeding configuration and row data.

use civica_models::EntityId;

/// An organizational entity to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySeed {
    pub name: String,
    pub parent_id: Option<EntityId>,
}

/// Shape of the generated tree: how many localidades, and how many children
/// each node receives one level down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerritoryConfig {
    pub localidades: usize,
    pub circuitos_per_localidad: usize,
    pub escuelas_per_circuito: usize,
    pub mesas_per_escuela: usize,
}

impl Default for TerritoryConfig {
    fn default() -> Self {
        Self {
            localidades: 3,
            circuitos_per_localidad: 4,
            escuelas_per_circuito: 5,
            mesas_per_escuela: 8,
        }
    }
}

impl TerritoryConfig {
    pub fn new(localidades: usize) -> Self {
        Self {
            localidades,
            ..Default::default()
        }
    }

    pub fn with_circuitos(mut self, per_localidad: usize) -> Self {
        self.circuitos_per_localidad = per_localidad;
        self
    }

    pub fn with_escuelas(mut self, per_circuito: usize) -> Self {
        self.escuelas_per_circuito = per_circuito;
        self
    }

    pub fn with_mesas(mut self, per_escuela: usize) -> Self {
        self.mesas_per_escuela = per_escuela;
        self
    }

    pub fn total_circuitos(&self) -> usize {
        self.localidades * self.circuitos_per_localidad
    }

    pub fn total_escuelas(&self) -> usize {
        self.total_circuitos() * self.escuelas_per_circuito
    }

    pub fn total_mesas(&self) -> usize {
        self.total_escuelas() * self.mesas_per_escuela
    }

    /// Entities across all four levels.
    pub fn total(&self) -> usize {
        self.localidades + self.total_circuitos() + self.total_escuelas() + self.total_mesas()
    }
}
