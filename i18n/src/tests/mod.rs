mod common;

mod file_loader_test;
mod translator_test;
