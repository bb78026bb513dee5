//! 组合搜索引擎
//!
//! 按客户分组，对每组穷举 1..=max_size 张发票的组合，保留总额落在目标
//! 容差内的组合。一次枚举同时服务所有目标；结果按
//! 目标 -> 客户(首次出现顺序) -> 组合大小 -> 字典序组合 排列。

use super::control::SearchControl;
use crate::error::SearchError;
use crate::models::{CustomerGroup, InvoiceRecord, MatchResult, MatchedInvoice, Target};
use indexmap::IndexMap;
use rayon::prelude::*;
use std::convert::Infallible;
use std::time::Instant;

/// 枚举过程中每访问这么多个节点检查一次中止控制
const CHECKPOINT_INTERVAL: usize = 1 << 14;

/// 按客户分组，保持客户首次出现顺序和组内源表顺序
pub fn group_by_customer(records: &[InvoiceRecord]) -> Vec<CustomerGroup<'_>> {
    let mut groups: IndexMap<&str, Vec<&InvoiceRecord>> = IndexMap::new();
    for record in records {
        groups.entry(record.customer.as_str()).or_default().push(record);
    }

    groups
        .into_iter()
        .map(|(customer, invoices)| CustomerGroup { customer, invoices })
        .collect()
}

/// 完整搜索，不可中止
pub fn search(records: &[InvoiceRecord], targets: &[Target]) -> Vec<MatchResult> {
    match run(records, targets, || Ok::<(), Infallible>(())) {
        Ok(results) => results,
        Err(never) => match never {},
    }
}

/// 带中止控制的搜索。中止时不返回部分结果
pub fn search_with_control(
    records: &[InvoiceRecord],
    targets: &[Target],
    control: &SearchControl,
) -> Result<Vec<MatchResult>, SearchError> {
    run(records, targets, || control.checkpoint())
}

fn run<E, F>(
    records: &[InvoiceRecord],
    targets: &[Target],
    checkpoint: F,
) -> Result<Vec<MatchResult>, E>
where
    E: Send,
    F: Fn() -> Result<(), E> + Sync,
{
    if records.is_empty() || targets.is_empty() {
        return Ok(Vec::new());
    }

    let start = Instant::now();
    let groups = group_by_customer(records);

    tracing::info!(
        "[Search] 开始搜索: {} 个客户, {} 张发票, {} 个目标",
        groups.len(),
        records.len(),
        targets.len()
    );

    // 各组互不相关，并行扫描；collect 保持组顺序
    let mut per_group: Vec<Vec<Vec<MatchResult>>> = groups
        .par_iter()
        .map(|group| scan_group(group, targets, &checkpoint))
        .collect::<Result<_, E>>()?;

    let mut results = Vec::new();
    for t in 0..targets.len() {
        for buckets in per_group.iter_mut() {
            results.append(&mut buckets[t]);
        }
    }

    tracing::info!(
        "[Search] 搜索完成: 命中 {} 个组合, 耗时: {:?}",
        results.len(),
        start.elapsed()
    );

    Ok(results)
}

/// 扫描一个客户组，返回每个目标各自的命中列表
fn scan_group<E, F>(
    group: &CustomerGroup<'_>,
    targets: &[Target],
    checkpoint: &F,
) -> Result<Vec<Vec<MatchResult>>, E>
where
    F: Fn() -> Result<(), E>,
{
    let mut buckets: Vec<Vec<MatchResult>> = vec![Vec::new(); targets.len()];
    let mut steps = 0;
    let max_size = targets
        .iter()
        .map(|t| t.max_size)
        .max()
        .unwrap_or(0)
        .min(group.len());

    for size in 1..=max_size {
        checkpoint()?;

        let active: Vec<usize> = (0..targets.len())
            .filter(|&t| targets[t].max_size >= size)
            .collect();
        let Some(ceiling) = active.iter().map(|&t| targets[t].ceiling()).max() else {
            continue;
        };

        let mut walk = SubsetWalk {
            group,
            targets,
            active,
            ceiling,
            size,
            picks: Vec::with_capacity(size),
            buckets: &mut buckets,
            checkpoint,
            steps,
        };
        walk.visit::<E>(0, 0)?;
        steps = walk.steps;
    }

    let hits: usize = buckets.iter().map(Vec::len).sum();
    tracing::debug!(
        "[Search] 客户 {}: {} 张发票, 最大组合 {}, 命中 {}",
        group.customer,
        group.len(),
        max_size,
        hits
    );

    Ok(buckets)
}

/// 固定大小组合的字典序深度优先枚举
struct SubsetWalk<'g, 'a, F> {
    group: &'g CustomerGroup<'a>,
    targets: &'g [Target],
    active: Vec<usize>,
    ceiling: i64,
    size: usize,
    picks: Vec<usize>,
    buckets: &'g mut [Vec<MatchResult>],
    checkpoint: &'g F,
    steps: usize,
}

impl<F> SubsetWalk<'_, '_, F> {
    fn visit<E>(&mut self, start: usize, sum: i64) -> Result<(), E>
    where
        F: Fn() -> Result<(), E>,
    {
        // 单个组合大小可能要枚举上亿个节点，中途也要响应取消
        self.steps += 1;
        if self.steps % CHECKPOINT_INTERVAL == 0 {
            (self.checkpoint)()?;
        }

        if self.picks.len() == self.size {
            self.emit(sum);
            return Ok(());
        }

        let remaining = self.size - self.picks.len();
        let n = self.group.len();
        for i in start..=n - remaining {
            let Some(next) = sum.checked_add(self.group.invoices[i].total) else {
                continue;
            };
            // 金额恒为正，部分和超过上限后整棵子树都不可能命中
            if next > self.ceiling {
                continue;
            }
            self.picks.push(i);
            self.visit::<E>(i + 1, next)?;
            self.picks.pop();
        }
        Ok(())
    }

    fn emit(&mut self, sum: i64) {
        for &t in &self.active {
            let target = &self.targets[t];
            if !target.accepts(sum) {
                continue;
            }
            self.buckets[t].push(MatchResult {
                target: target.amount,
                customer: self.group.customer.to_string(),
                invoices: self
                    .picks
                    .iter()
                    .map(|&i| MatchedInvoice::from(self.group.invoices[i]))
                    .collect(),
                combination_total: sum,
            });
        }
    }
}
