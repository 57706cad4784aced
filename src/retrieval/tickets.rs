use crossbeam_channel::{Receiver, Sender, bounded};

use crate::constants::retrieval::FIRST_TICKET;
use crate::retrieval::coordinator::TerminationCoordinator;
use crate::types::TicketId;

/// Build the lazy, finite ticket sequence `1..=total` for one retrieval.
///
/// The issuer side runs on its own thread; the stream side is cloned once per
/// worker. Dropping the issuer (after the last ticket or on stop) closes the
/// stream; dropping every stream unblocks the issuer.
pub fn ticket_channel(total: u64, buffer: usize) -> (TicketIssuer, TicketStream) {
    let (sender, receiver) = bounded(buffer);
    (
        TicketIssuer { sender, total },
        TicketStream { receiver },
    )
}

/// Producer half of the ticket sequence.
pub struct TicketIssuer {
    sender: Sender<TicketId>,
    total: u64,
}

impl TicketIssuer {
    /// Issue tickets until the sequence ends, the coordinator stops, or no
    /// worker is left to receive. Returns the number of tickets issued.
    pub fn run(self, coordinator: &TerminationCoordinator) -> u64 {
        let mut issued = 0;
        for ticket in (0..self.total).map(|offset| FIRST_TICKET + offset) {
            if !coordinator.is_running() {
                break;
            }
            if self.sender.send(ticket).is_err() {
                break;
            }
            issued += 1;
        }
        issued
    }
}

/// Consumer half of the ticket sequence.
#[derive(Clone)]
pub struct TicketStream {
    receiver: Receiver<TicketId>,
}

impl TicketStream {
    /// Block for the next ticket; `None` once the stream is closed or stopping.
    pub fn next_ticket(&self, coordinator: &TerminationCoordinator) -> Option<TicketId> {
        if !coordinator.is_running() {
            return None;
        }
        let ticket = self.receiver.recv().ok()?;
        coordinator.is_running().then_some(ticket)
    }
}
