//! Shared factories for unit tests.


pub use sample::SampleModel;
