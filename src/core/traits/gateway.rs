use crate::core::models::entry::Entry;

/// Port that receives the finalized entry list.
///
/// Fire-and-forget: the editor never observes whether persisting
/// succeeded, so implementations report their own failures.
pub trait PersistenceGateway: Send + Sync {
    fn items_changed(&self, entries: &[Entry]);
}
