use tracing::info;

use crate::error::Result;
use crate::model::{AssignmentConfig, ConfigField};
use crate::session::Session;
use crate::store::KeyValueStore;

/// Sets one configuration field and saves the session.
pub fn set_field<S: KeyValueStore + ?Sized>(
    store: &S,
    field: ConfigField,
    value: &str,
) -> Result<AssignmentConfig> {
    let mut session = Session::load(store);
    session.config.set(field, value);
    session.save(store)?;

    info!(field = field.key(), value, "updated configuration");
    Ok(session.config)
}

/// Puts every configuration field back to its default. Questions are kept.
pub fn reset<S: KeyValueStore + ?Sized>(store: &S) -> Result<AssignmentConfig> {
    let mut session = Session::load(store);
    session.config = AssignmentConfig::default();
    session.save(store)?;

    info!("reset configuration to defaults");
    Ok(session.config)
}
