// Adapters layer: concrete forms and views the submit flow reads from and writes to.

pub mod form;
pub mod view;
