use super::super::traits::SqlGenerator;

/// Portable SQL with every hook left at its default.
pub struct AnsiGenerator;

impl SqlGenerator for AnsiGenerator {}
