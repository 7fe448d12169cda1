pub mod frontier;
pub mod run;
pub mod util;
pub mod validate;
