use crate::ticket::Ticket;
use crate::Result;

/// Archive formats that carry a ticket section (WAD and friends).
///
/// Implementors only have to hand out the ticket they hold; loading and dumping raw ticket bytes
/// is provided.
pub trait TicketContainer {
    fn ticket(&self) -> &Ticket;
    fn set_ticket(&mut self, ticket: Ticket);

    /// Replaces the held ticket with one decoded from `bytes`.
    ///
    /// If decoding fails the held ticket is left as it was.
    fn load_ticket(&mut self, bytes: &[u8]) -> Result<()> {
        let ticket = Ticket::from_bytes(bytes)?;
        self.set_ticket(ticket);
        Ok(())
    }
    /// Encodes the held ticket for writing back into the archive
    fn ticket_bytes(&self) -> Result<Vec<u8>> {
        self.ticket().to_bytes()
    }
}
