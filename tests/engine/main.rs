//! Integration tests for Layer 3: Engine
//!
//! Tests for classification, drift, aggregation, and report building.

mod aggregate;
mod compare;
mod report;
