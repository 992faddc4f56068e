pub mod poller;
pub mod source;
pub mod store;
pub mod view;

pub use poller::start_poller;
pub use source::SnapshotSource;
pub use store::TickerStore;
pub use view::{derive_view, render_ticker, TickerView};
