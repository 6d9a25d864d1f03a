mod common;
mod depends_tests;
mod dispatch_tests;
mod executable_tests;
mod link_tests;
