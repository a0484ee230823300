pub mod collision;
pub mod document;
pub mod layout;
pub mod numbering;
pub mod selection;
pub mod session;
pub mod spatial;

pub use collision::CollisionResolver;
pub use document::{DocumentSeat, LayoutDocument};
pub use layout::{Layout, SeatUpdate};
pub use numbering::NumberingAssigner;
pub use selection::Selection;
pub use session::{LayoutSession, SeatView};
pub use spatial::{Alignment, ArrangeParams, SpacingAxis, SpatialEngine};
