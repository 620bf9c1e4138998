pub mod page;
pub mod ticket;

pub use page::Page;
pub use ticket::{ParseEnumError, Priority, Status, Ticket, TicketDraft};
