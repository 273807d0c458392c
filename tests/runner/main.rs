mod extraction;
mod resume;
mod support;
mod workers;
