pub mod financing;
pub mod rental;
