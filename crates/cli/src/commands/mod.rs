pub mod formats;
pub mod generate;
pub mod inventory;
pub mod run;
pub mod scan;
pub mod util;

pub use formats::*;
pub use generate::*;
pub use inventory::*;
pub use run::*;
pub use scan::*;
pub use util::*;
