//! Records that keep their identity across snapshots.

/// A record identified by its id rather than by its field values.
///
/// Records received from the remote API (users, products, sales) are
/// entities: two snapshots with the same id describe the same thing, even
/// when their fields differ.
pub trait Entity {
    type Id: Eq;

    fn id(&self) -> &Self::Id;
}

/// Index of the first record with the given id.
pub fn position_of<E: Entity>(records: &[E], id: &E::Id) -> Option<usize> {
    records.iter().position(|record| record.id() == id)
}
