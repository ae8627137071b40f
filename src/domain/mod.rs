//! Domain layer - Workflow values and rules.
//!
//! Pure types for the approve → swap → approve → deposit workflow:
//! amount conversion, swap parameters, transaction handles, the step
//! state machine and the error taxonomy. No I/O happens here.

pub mod amount;
pub mod errors;
pub mod swap;
pub mod token;
pub mod tx;
pub mod workflow;

pub use amount::{format_units, parse_units};
pub use errors::{
    AmountError, AuthorizationError, ChainError, ConfigurationError, ConfirmationError,
    DepositError, SwapError, WorkflowError,
};
pub use swap::{FeeTier, SwapParams};
pub use token::TokenRef;
pub use tx::{PendingTx, TxReceipt};
pub use workflow::{RunReport, Step, StepRecord};
