//! Lead intake: the three-step valuation wizard on the landing page.
//!
//! The wizard collects an address, property details, and contact details,
//! then hands the record to a `LeadSubmitter`. The shipped submitter only
//! simulates a CRM round trip.

pub mod flow;
pub mod model;
pub mod registry;
pub mod routes;
pub mod state;
pub mod submit;

pub use flow::LeadIntakeFlow;
pub use model::{ContactDetails, LeadRecord, PropertyType, Timeline};
pub use registry::IntakeRegistry;
pub use routes::{IntakeRouteState, intake_routes};
pub use state::IntakeStep;
pub use submit::{LeadSubmitter, SimulatedSubmitter, SubmissionHandle};
