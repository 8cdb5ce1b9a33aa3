pub mod container;
pub mod crypto;
pub mod error;
pub mod string;
pub mod ticket;
pub mod titleid;

pub use error::WadtikError;

pub type Result<T> = std::result::Result<T, WadtikError>;

pub mod prelude {
    pub use crate::container::TicketContainer;
    pub use crate::crypto::KeyType;
    pub use crate::string::SizedCString;
    pub use crate::ticket::{Ticket, TimeLimitEntry, TICKET_SIZE};
    pub use crate::titleid::TitleId;
    pub use crate::{Result, WadtikError};
}
