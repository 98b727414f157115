pub mod function_web;
