//! Core application modules for Cloud Visualizer.
//!
//! # Module Organization
//!
//! - [`config`] - Region, endpoint and credential configuration
//! - [`aws_regions`] - Region identifier validation
//! - [`data_plane`] - CloudWatch Logs session, retrieval operations and selection controller
//! - [`dashui`] - egui user interface
//!
//! # Architecture
//!
//! [`config`] resolves the connection settings, [`data_plane`] turns them into a
//! [`data_plane::cloudwatch_logs::ClientSession`] and drives every fetch, and [`dashui`]
//! renders whatever state the controller currently holds.

pub mod aws_regions;
pub mod config;
pub mod dashui;
pub mod data_plane;

pub use dashui::app::DashApp;
