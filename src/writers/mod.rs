mod row_writer;

pub use row_writer::RowWriter;
