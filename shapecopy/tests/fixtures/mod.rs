#![allow(dead_code)]

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use shapecopy::{Value, record};

record! {
    #[derive(Clone, Debug, Default)]
    pub struct Sub1 {
        pub sub1: String,
        pub sub2: isize,
        pub generic1: Value,
        private_data: isize,
    }
}

impl Sub1 {
    pub fn with_private_data(mut self, private_data: isize) -> Self {
        self.private_data = private_data;
        self
    }

    pub fn private_data(&self) -> isize {
        self.private_data
    }
}

record! {
    #[derive(Clone, Debug, Default)]
    pub struct Struct1 {
        pub id1: String,
        pub data1: String,
        pub data2: String,
        pub int1: isize,
        pub int2: i32,
        pub int3: isize,
        pub date1: DateTime<Utc>,
        pub date2: Option<DateTime<Utc>>,
        pub map: HashMap<String, isize>,
        pub sub: Sub1,
        pub sub_ptr: Option<Box<Sub1>>,
    }
}

record! {
    #[derive(Clone, Debug, Default)]
    pub struct Struct2 {
        pub id1: String,
        pub data1: String,
        pub int1: isize,
        pub int2: i32,
        pub date2: Option<DateTime<Utc>>,
        pub map: HashMap<String, isize>,
        pub sub_ptr: Option<Box<Sub1>>,
    }
}

/// A fixed, non-epoch timestamp.
pub fn timestamp() -> DateTime<Utc> {
    DateTime::from_timestamp(1_666_000_000, 0).unwrap_or_default()
}
