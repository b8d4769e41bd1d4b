mod provider;
mod service;
mod state;

#[allow(unused_imports)]
pub use provider::{LoadProvider, SysinfoLoadProvider};
pub use service::run_monitor_loop;
#[allow(unused_imports)]
pub use state::MonitorState;
