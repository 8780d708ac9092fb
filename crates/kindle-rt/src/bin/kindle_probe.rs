//! 平台能力探测工具。
//!
//! # 说明
//! - 无参数时输出本构建的能力描述符；
//! - 给出若干目标三元组时，逐个输出该目标的能力上限；
//! - 输出为 JSON 数组，供构建流水线比对。

use std::{env, process};

use kindle_platform::PlatformDescriptor;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct ProbeReport {
    target: String,
    class: &'static str,
    capabilities: Vec<&'static str>,
}

impl ProbeReport {
    fn new(target: String, descriptor: PlatformDescriptor) -> Self {
        Self {
            target,
            class: descriptor.class().as_str(),
            capabilities: descriptor.capability_names().collect(),
        }
    }
}

fn main() {
    let triples: Vec<String> = env::args().skip(1).collect();
    let reports: Vec<ProbeReport> = if triples.is_empty() {
        vec![ProbeReport::new(
            String::from("native"),
            kindle_rt::platform(),
        )]
    } else {
        triples
            .into_iter()
            .map(|triple| {
                let descriptor = PlatformDescriptor::for_triple(&triple);
                ProbeReport::new(triple, descriptor)
            })
            .collect()
    };

    match serde_json::to_string_pretty(&reports) {
        Ok(json) => println!("{json}"),
        Err(error) => {
            eprintln!("能力探测结果序列化失败: {error}");
            process::exit(1);
        }
    }
}
