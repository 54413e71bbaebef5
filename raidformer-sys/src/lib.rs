// SPDX-License-Identifier: GPL-3.0-only

//! System operations for RAID provisioning
//!
//! This crate holds everything that touches the machine or the cloud account:
//! - Pre-flight checks against the device namespace
//! - Volume creation, attachment and tagging through the EC2 CLI
//! - Waiting for attached volumes to appear as device nodes
//! - Composing and running the mdadm / LVM / mkfs / mount command list
//!
//! These operations require root on the instance and credentials for the
//! cloud account.

pub mod cloud;
pub mod cmd;
pub mod compose;
pub mod error;
pub mod preflight;
pub mod provision;
pub mod wait;

pub use cloud::{BlockStorage, Ec2Cli, MetadataClient};
pub use cmd::{CommandOutcome, execute_plan, run_shell};
pub use compose::{CommandPlan, compose};
pub use error::{Result, SysError};
pub use preflight::{check_preconditions, check_preconditions_in, warn_missing_tools};
pub use provision::{provision_volumes, provision_volumes_with};
pub use wait::{Clock, SystemClock, wait_for_devices, wait_for_devices_with};
