//! Integration test harness.
//!
//! Drives the full [`AppService`](dripgate::app::service::AppService)
//! through its port boundary with mock hardware — no GPIO, no ADC, no
//! sleep.  Each scenario file gets the shared mocks from [`mock_hw`].

mod controller_tests;
mod mock_hw;
