pub mod errors;
pub mod io;
pub mod model;

pub use errors::DatasetError;
pub use io::{read_clean_dataset, read_raw_dataset, write_clean_dataset, write_raw_dataset};
pub use model::{ProjectRecord, RawDataset, RawRecord, RawSkills};
