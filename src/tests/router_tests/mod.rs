mod export_tests;
mod home_tests;
mod merge_tests;
