mod inspect;
mod run;

pub use inspect::InspectClipboard;
pub use run::Run;
