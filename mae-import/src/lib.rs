//! mae-import: talks to the statement parsing service and turns its rows
//! into transactions, trying candidate modes until one yields results.

pub mod error;
pub mod importer;
pub mod request;
pub mod response;
pub mod service;
pub mod transport;

pub use error::RequestError;
pub use importer::StatementImporter;
pub use request::ProcessRequest;
pub use response::ProcessResponse;
pub use transport::{HttpTransport, RawResponse, StatementTransport};
