// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics::{describe_counter, describe_gauge};
use once_cell::sync::Lazy;

static DESCRIBED: Lazy<()> = Lazy::new(|| {
    describe_counter!(
        "scope_filter_admitted_total",
        "Total number of follow requests admitted by the scope filter"
    );
    describe_counter!(
        "scope_filter_filtered_total",
        "Total number of follow requests dropped as offsite"
    );
    describe_counter!(
        "scope_filter_offsite_domains_total",
        "Total number of distinct offsite domains reported per job"
    );
    describe_gauge!(
        "scope_filter_active_jobs",
        "Current number of jobs with scope state"
    );
});

/// 注册作用域过滤相关指标的描述
///
/// 指标记录器由宿主安装；未安装时这些描述不产生任何效果。只会执行一次。
pub fn describe_metrics() {
    Lazy::force(&DESCRIBED);
}
