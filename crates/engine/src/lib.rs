pub mod grid;
pub mod record;
pub mod registry;
pub mod view;
pub mod xref;
