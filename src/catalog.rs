//! External collaborator traits: catalog loading is owned by the host
//! application, not this crate. `Catalogs` bundles the four loaders the
//! pipeline needs at startup.

use crate::domain::{Course, RoomCatalog};
use anyhow::Result;

pub trait CourseCatalog {
    fn load_courses(&self) -> Result<Vec<Course>>;
}

pub trait RoomCatalogSource {
    fn load_rooms(&self) -> Result<RoomCatalog>;
}

pub trait TimeSettingsSource {
    /// Returns `(start_hour, end_hour)`, with `start_hour < end_hour`.
    fn load_time_settings(&self) -> Result<(i64, i64)>;
}

pub trait DayCatalog {
    fn load_days(&self) -> Result<Vec<String>>;
}

pub struct Catalogs<'a> {
    pub courses: &'a dyn CourseCatalog,
    pub rooms: &'a dyn RoomCatalogSource,
    pub time_settings: &'a dyn TimeSettingsSource,
    pub days: &'a dyn DayCatalog,
}
