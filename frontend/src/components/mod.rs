pub mod header;
pub mod input_form;
pub mod preview_area;
pub mod progress_bar;
pub mod results;
pub mod utils;
