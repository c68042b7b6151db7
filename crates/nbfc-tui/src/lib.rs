//! Terminal widgets for the NBFC panel.

pub mod widgets;
