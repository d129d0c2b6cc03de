use randorder_core::{BucketType, StrategyRegistry};

use crate::exit_codes::SUCCESS;

fn describe(bucket_type: BucketType) -> &'static str {
    match bucket_type {
        BucketType::Global => "shuffle across the whole run",
        BucketType::Package => "tests stay within their package",
        BucketType::Module => "tests stay within their module (default)",
        BucketType::Class => "tests stay within their class, or module for free functions",
        BucketType::Parent => "tests stay within their direct parent scope",
        BucketType::Grandparent => "tests stay within their parent's parent scope",
        BucketType::None => "keep collection order",
    }
}

pub fn run() -> anyhow::Result<i32> {
    for bucket_type in StrategyRegistry::builtin().bucket_types() {
        println!("{:<12} {}", bucket_type.as_str(), describe(bucket_type));
    }
    Ok(SUCCESS)
}
