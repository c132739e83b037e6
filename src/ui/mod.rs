//! UI module - slice renderers and shared components

pub mod components;
pub mod testimonial;
