#![allow(dead_code)]

pub mod critical_utils;
