pub mod chunk;
pub mod document;
pub mod persona;
pub mod test_case;
pub mod ticket;
pub mod voyage;
