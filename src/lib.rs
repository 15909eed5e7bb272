pub mod checks;
pub mod io;
