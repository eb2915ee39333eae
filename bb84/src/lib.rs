//! # bb84
//!
//! BB84 key distribution between two parties over an inspectable channel.
//!
//! A [`Sender`](sender::Sender) encodes random bits as photons in random
//! bases and posts them to a [`QuantumChannel`](channel::QuantumChannel). A
//! [`Receiver`](receiver::Receiver) measures them in bases of its own. Both
//! announce their bases on the channel, keep the positions where the bases
//! agree, and accept the exchange when that sifted key is long enough.
//!
//! Bases and polarizations are symbolic values. A photon read in the wrong
//! basis gives a fair coin flip; nothing else about the physics is modelled.

pub mod bb84;
pub mod bb84_states;
pub mod channel;
pub mod communicator;
pub mod config;
pub mod eavesdropper;
pub mod error;
pub mod privacy_amplification;
pub mod receiver;
pub mod sender;
pub mod session;

pub mod prelude {
    pub use crate::bb84::*;
    pub use crate::bb84_states::*;
    pub use crate::channel::*;
    pub use crate::communicator::*;
    pub use crate::config::*;
    pub use crate::eavesdropper::*;
    pub use crate::error::*;
    pub use crate::privacy_amplification::*;
    pub use crate::receiver::*;
    pub use crate::sender::*;
    pub use crate::session::*;
}
