//! Dense banded linear algebra for the reduced active-set system.

pub mod banded;
