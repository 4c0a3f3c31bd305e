//! Property-based tests for the register codec and address mapping.
