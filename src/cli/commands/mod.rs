pub mod catalog;
pub mod item;
pub mod package;
pub mod storage;
pub mod system;

use crate::cli::registry::CommandRegistry;

pub(crate) fn register_all(registry: &mut CommandRegistry) {
    for entry in package::definitions()
        .into_iter()
        .chain(catalog::definitions())
        .chain(item::definitions())
        .chain(storage::definitions())
        .chain(system::definitions())
    {
        registry.register(entry);
    }
}
