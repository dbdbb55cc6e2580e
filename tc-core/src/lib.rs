//! # Time capsule core library
#![deny(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links
)]
//! Time capsules are messages that cannot be read before a chosen moment.
//! The protocol binds that moment to a round of a public randomness beacon:
//! until the beacon publishes the round's signature, nobody (including the
//! author) can open the capsule.
//!
//! The library implements a hybrid construction:
//!
//! * Timelock: an ephemeral secret (or, for public capsules, the message
//! itself) is locked to a beacon round through an injected
//! [`TimelockOracle`][`oracle::TimelockOracle`].
//!
//! * Symmetric tail: for private capsules the message is length-padded,
//! encrypted with ChaCha20 and authenticated with HMAC-SHA256 under keys
//! derived from the ephemeral secret via HKDF, so the locked blob stays
//! small no matter how large the message is.
//!
//! * Envelope: the packed payload travels inside a signed
//! [`Envelope`][`envelope::Envelope`] whose tags name the beacon chain,
//! the target round and the intended recipients.
//!
//! The beacon, the signature scheme and the distribution network are all
//! collaborators behind traits; the core owns only the arithmetic, the
//! byte formats and the validation order.
//!
//! ## Examples
//!
//! ### Seal and unseal a public capsule
//!
//! ```
//! use tc_core::client::{Sealer, Unsealer};
//! # use tc_core::test::TestSetup;
//! # use tc_core::error::Error;
//!
//! # fn main() -> Result<(), Error> {
//! let mut rng = rand::thread_rng();
//! # let setup = TestSetup::new(&mut rng);
//! # let chain = &setup.chain;
//! # let oracle = &setup.oracle;
//! # let signer = &setup.signer;
//! # let unlock_time = chain.round_time(110);
//!
//! // Retrieve chain parameters, oracle and signer.
//!
//! let input = b"see you in the future";
//! let sealed = Sealer::new(chain, unlock_time, oracle, signer, &mut rng)?
//!     .seal_public(input, 1_700_000_000)?;
//!
//! # setup.oracle.publish_round(110);
//! // Once the beacon reaches the target round:
//! let original = Unsealer::new(sealed, signer)?.unseal(oracle)?;
//!
//! assert_eq!(original, input);
//! # Ok(())
//! # }
//! ```
//!
//! ### Wire format
//!
//! The private payload consists of the following segments, followed by
//! their length in bytes:
//!
//! ```text
//!                  HEAD (5)
//! = MODE 0x02 (1) || TLOCK LEN (4, BE)
//!
//!                  LOCKED SECRET (*)
//! = TLOCK BLOB (TLOCK LEN)
//!
//!                  TAIL (>= 97)
//! = VERSION 0x02 (1) || NONCE (32) || CIPHERTEXT (*) || TAG (32)
//! ```
//!
//! The public payload is `MODE 0x01 (1) || TLOCK BLOB (*)`, with the
//! message itself inside the locked blob and no length field.

pub mod client;
pub mod consts;
pub mod envelope;
pub mod error;
pub mod kdf;
pub mod oracle;
pub mod padding;
pub mod payload;
pub mod rounds;
pub mod transport;

#[doc(hidden)]
pub use consts::*;

#[doc(hidden)]
pub mod test;
