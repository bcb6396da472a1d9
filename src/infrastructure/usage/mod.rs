mod unlimited_usage_gate;

pub use unlimited_usage_gate::UnlimitedUsageGate;
