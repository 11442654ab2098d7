//! CLI Error Types

use derive_more::{Display, Error};

pub type Error = exn::Exn<ErrorKind>;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    #[display("could not load configuration")]
    Config,
    #[display("could not set up logging")]
    Logging,
    #[display("could not open the artifact store")]
    Storage,
    #[display("index query failed")]
    Index,
    #[display("could not write output")]
    Output,
}
