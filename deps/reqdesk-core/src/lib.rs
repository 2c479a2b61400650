//! # Core library of reqdesk
//!
//! This library holds everything of the ticket administration client that does not touch
//! the network: the entities exchanged with the backend, the ticket code rules and the
//! state of the edition forms.
//!
//! ## Ticket codes
//!
//! A ticket (a *requerimiento*) is identified by a human readable code such as
//! `INC-2024-0000000007`. The [`codigo`] module composes and checks these codes and the
//! [`sequence`] module keeps the code of a form in line with the selected ticket type,
//! asking the backend for the next free sequence number through a [`SequenceSource`].
//!
//! ## Forms
//!
//! The [`form`] module replaces the loosely typed form objects with one structure per
//! entity. Each setter enforces the business rules (state and assignee coupling, type and
//! category coupling, attachment limits...) and records the rejections in a
//! [`FieldErrors`] map.
//!
//! ## Network
//!
//! This crate is runtime agnostic. The binary crate plugs the REST gateways in through the
//! [`SequenceSource`] and [`form::AvailabilityCheck`] traits.
//!
//! [`SequenceSource`]: sequence::SequenceSource
//! [`FieldErrors`]: form::FieldErrors

pub mod codigo;
pub mod filter;
pub mod form;
pub mod model;
pub mod sequence;

pub use codigo::Codigo;
pub use sequence::{CodeAssigner, SequenceSource};
