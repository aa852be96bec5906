// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 作用域过滤器测试模块
///
/// 通过公开接口验证作用域过滤的准入规则、诊断去重和作业生命周期

#[cfg(test)]
mod tests {
    use crawl_scope::{
        CrawlJob, DiagnosticsSink, FollowRequest, JobEvent, JobScope, OffsiteRecord, ScopeError,
        ScopeFilter, SpiderOutput,
    };
    use futures::StreamExt;
    use std::sync::{Arc, Mutex};
    use tokio::sync::broadcast;

    /// 收集所有诊断记录的接收器
    #[derive(Default)]
    struct RecordingSink {
        records: Mutex<Vec<OffsiteRecord>>,
    }

    impl RecordingSink {
        fn hostnames(&self) -> Vec<String> {
            self.records
                .lock()
                .unwrap()
                .iter()
                .map(|record| record.hostname.clone())
                .collect()
        }
    }

    impl DiagnosticsSink for RecordingSink {
        fn record(&self, record: OffsiteRecord) {
            self.records.lock().unwrap().push(record);
        }
    }

    /// 页面中的数据项
    #[derive(Debug, Clone, PartialEq)]
    struct Product {
        name: &'static str,
    }

    fn follow(url: &str) -> SpiderOutput<Product> {
        SpiderOutput::Request(FollowRequest::new(url))
    }

    fn recording_filter() -> (ScopeFilter, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::default());
        (ScopeFilter::with_diagnostics(sink.clone()), sink)
    }

    fn admitted_hosts(filter: &ScopeFilter, job: &CrawlJob, urls: &[&str]) -> Vec<String> {
        filter
            .filter(job, urls.iter().map(|url| follow(url)))
            .unwrap()
            .filter_map(|output| output.as_request().map(|r| r.hostname().to_string()))
            .collect()
    }

    #[test]
    fn test_shop_scenario() {
        let (filter, sink) = recording_filter();
        let job = CrawlJob::new("shop", vec!["shop.example"]);
        filter.on_job_start(&job).unwrap();

        let item = SpiderOutput::Item(Product { name: "kettle" });
        let bypass =
            SpiderOutput::Request(FollowRequest::bypassing_scope("https://ads.tracker.com/ok"));
        let batch = vec![
            follow("https://www.shop.example/kettles"),
            follow("https://ads.tracker.com/pixel"),
            follow("https://ads.tracker.com/pixel?again=1"),
            item.clone(),
            bypass.clone(),
        ];

        let admitted: Vec<_> = filter.filter(&job, batch).unwrap().collect();

        assert_eq!(
            admitted,
            vec![follow("https://www.shop.example/kettles"), item, bypass]
        );
        assert_eq!(sink.hostnames(), vec!["ads.tracker.com"]);

        let records = sink.records.lock().unwrap();
        assert_eq!(records[0].job_id, job.id);
        assert_eq!(records[0].request.url(), "https://ads.tracker.com/pixel");
    }

    #[test]
    fn test_retargeted_request_is_checked_against_new_host() {
        let (filter, sink) = recording_filter();
        let job = CrawlJob::new("shop", vec!["shop.example"]);
        filter.on_job_start(&job).unwrap();

        let mut request = FollowRequest::new("https://shop.example/");
        assert_eq!(request.hostname(), "shop.example");
        request.set_url("https://ads.tracker.com/");

        let admitted = filter
            .filter(&job, vec![SpiderOutput::<Product>::Request(request)])
            .unwrap()
            .count();

        assert_eq!(admitted, 0);
        assert_eq!(sink.hostnames(), vec!["ads.tracker.com"]);
    }

    #[test]
    fn test_no_allowed_domains_admits_everything() {
        let (filter, sink) = recording_filter();
        let job = CrawlJob::new("open", Vec::<String>::new());
        filter.on_job_start(&job).unwrap();

        let batch = vec![
            follow("https://anything.test/"),
            follow("http://10.0.0.1/admin"),
            follow("javascript:void(0)"),
            follow("mailto:someone@example.com"),
        ];
        let admitted = filter.filter(&job, batch).unwrap().count();

        assert_eq!(admitted, 4);
        assert!(sink.hostnames().is_empty());
    }

    #[test]
    fn test_suffix_boundaries() {
        let (filter, sink) = recording_filter();
        let job = CrawlJob::new("example", vec!["example.com"]);
        filter.on_job_start(&job).unwrap();

        let admitted = admitted_hosts(
            &filter,
            &job,
            &[
                "https://example.com/",
                "https://a.example.com/",
                "https://notexample.com/",
                "https://example.com.evil.com/",
            ],
        );

        assert_eq!(admitted, vec!["example.com", "a.example.com"]);
        assert_eq!(
            sink.hostnames(),
            vec!["notexample.com", "example.com.evil.com"]
        );
    }

    #[test]
    fn test_uppercase_allowed_domain_admits_nothing() {
        let (filter, _sink) = recording_filter();
        let job = CrawlJob::new("caps", vec!["Example.com"]);
        filter.on_job_start(&job).unwrap();

        // URL parsing lowercases the host, matching stays case-sensitive
        let admitted = admitted_hosts(
            &filter,
            &job,
            &["https://example.com/", "https://WWW.EXAMPLE.COM/"],
        );
        assert!(admitted.is_empty());
    }

    #[test]
    fn test_empty_hostname_filtered_without_record() {
        let (filter, sink) = recording_filter();
        let job = CrawlJob::new("shop", vec!["shop.example"]);
        filter.on_job_start(&job).unwrap();

        let admitted = filter
            .filter(&job, vec![follow("javascript:history.back()"), follow("")])
            .unwrap()
            .count();

        assert_eq!(admitted, 0);
        assert!(sink.hostnames().is_empty());
        assert_eq!(filter.seen_domains(job.id), Some(Vec::new()));
    }

    #[test]
    fn test_dedup_persists_across_batches() {
        let (filter, sink) = recording_filter();
        let job = CrawlJob::new("shop", vec!["shop.example"]);
        filter.on_job_start(&job).unwrap();

        for _ in 0..3 {
            let _ = filter
                .filter(&job, vec![follow("https://ads.tracker.com/")])
                .unwrap()
                .count();
        }

        assert_eq!(sink.hostnames(), vec!["ads.tracker.com"]);
    }

    #[test]
    fn test_dedup_is_per_job() {
        let (filter, sink) = recording_filter();
        let first = CrawlJob::new("first", vec!["shop.example"]);
        let second = CrawlJob::new("second", vec!["shop.example"]);
        filter.on_job_start(&first).unwrap();
        filter.on_job_start(&second).unwrap();

        for job in [&first, &second] {
            let _ = filter
                .filter(job, vec![follow("https://ads.tracker.com/")])
                .unwrap()
                .count();
        }

        let records = sink.records.lock().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].job_id, first.id);
        assert_eq!(records[1].job_id, second.id);
    }

    #[test]
    fn test_restart_with_new_domains_resets_matching_and_dedup() {
        let (filter, sink) = recording_filter();
        let job = CrawlJob::new("shop", vec!["shop.example"]);
        filter.on_job_start(&job).unwrap();
        assert!(admitted_hosts(&filter, &job, &["https://ads.tracker.com/"]).is_empty());
        filter.on_job_stop(&job).unwrap();
        assert!(!filter.is_active(job.id));
        assert_eq!(filter.seen_domains(job.id), None);

        let widened = CrawlJob::with_id(job.id, "shop", vec!["tracker.com"]);
        filter.on_job_start(&widened).unwrap();

        assert_eq!(
            admitted_hosts(&filter, &widened, &["https://ads.tracker.com/"]),
            vec!["ads.tracker.com"]
        );
        assert!(admitted_hosts(&filter, &widened, &["https://shop.example/"]).is_empty());
        assert_eq!(sink.hostnames(), vec!["ads.tracker.com", "shop.example"]);
    }

    #[test]
    fn test_matcher_ignores_later_job_changes() {
        let (filter, _sink) = recording_filter();
        let mut job = CrawlJob::new("shop", vec!["shop.example"]);
        filter.on_job_start(&job).unwrap();

        job.allowed_domains.push("tracker.com".to_string());

        assert!(admitted_hosts(&filter, &job, &["https://ads.tracker.com/"]).is_empty());
    }

    #[test]
    fn test_lifecycle_misuse_is_reported() {
        let (filter, _sink) = recording_filter();
        let job = CrawlJob::new("never-started", vec!["shop.example"]);

        match filter.on_job_stop(&job) {
            Err(ScopeError::LifecycleMisuse { job_id }) => assert_eq!(job_id, job.id),
            other => panic!("expected lifecycle misuse, got {other:?}"),
        }
    }

    #[test]
    fn test_jobs_filter_concurrently() {
        let (filter, sink) = recording_filter();
        let jobs: Vec<CrawlJob> = (0..8)
            .map(|i| CrawlJob::new(format!("job-{i}"), vec![format!("site{i}.example")]))
            .collect();
        for job in &jobs {
            filter.on_job_start(job).unwrap();
        }

        std::thread::scope(|scope| {
            for (i, job) in jobs.iter().enumerate() {
                let filter = filter.clone();
                scope.spawn(move || {
                    for round in 0..50 {
                        let batch = vec![
                            follow(&format!("https://www.site{i}.example/{round}")),
                            follow(&format!("https://offsite{}.test/", round % 5)),
                        ];
                        let admitted: Vec<_> = filter.filter(job, batch).unwrap().collect();
                        assert_eq!(admitted.len(), 1);
                    }
                });
            }
        });

        assert_eq!(sink.hostnames().len(), 8 * 5);
        for job in &jobs {
            assert_eq!(filter.seen_domains(job.id).unwrap().len(), 5);
            filter.on_job_stop(job).unwrap();
        }
        assert_eq!(filter.active_jobs(), 0);
    }

    #[test]
    fn test_job_scope_used_directly() {
        let sink = RecordingSink::default();
        let job = CrawlJob::new("owned", vec!["shop.example"]);
        let scope = JobScope::new(&job).unwrap();

        let admitted: Vec<_> = scope
            .filter(
                vec![
                    follow("https://shop.example/"),
                    follow("https://ads.tracker.com/"),
                ],
                &sink,
            )
            .collect();

        assert_eq!(admitted, vec![follow("https://shop.example/")]);
        assert_eq!(scope.seen_domains(), vec!["ads.tracker.com"]);
        assert_eq!(sink.hostnames(), vec!["ads.tracker.com"]);
    }

    #[tokio::test]
    async fn test_filter_stream_preserves_order() {
        let (filter, sink) = recording_filter();
        let job = CrawlJob::new("stream", vec!["shop.example"]);
        filter.on_job_start(&job).unwrap();

        let outputs = futures::stream::iter(vec![
            follow("https://ads.tracker.com/"),
            follow("https://a.shop.example/"),
            SpiderOutput::Item(Product { name: "mug" }),
            follow("https://b.shop.example/"),
        ]);

        let admitted: Vec<_> = filter
            .filter_stream(&job, outputs)
            .unwrap()
            .collect()
            .await;

        assert_eq!(
            admitted,
            vec![
                follow("https://a.shop.example/"),
                SpiderOutput::Item(Product { name: "mug" }),
                follow("https://b.shop.example/"),
            ]
        );
        assert_eq!(sink.hostnames(), vec!["ads.tracker.com"]);
    }

    #[tokio::test]
    async fn test_listener_follows_job_events() -> anyhow::Result<()> {
        let (filter, _sink) = recording_filter();
        let (events, receiver) = broadcast::channel(16);
        let listener = {
            let filter = filter.clone();
            tokio::spawn(async move { filter.listen(receiver).await })
        };

        let job = CrawlJob::new("evented", vec!["shop.example"]);
        events.send(JobEvent::Started(job.clone()))?;
        events.send(JobEvent::Stopped(job.clone()))?;
        events.send(JobEvent::Started(job.clone()))?;
        drop(events);

        listener.await??;
        assert!(filter.is_active(job.id));
        assert_eq!(filter.active_jobs(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_listener_stops_on_lifecycle_misuse() {
        let (filter, _sink) = recording_filter();
        let (events, receiver) = broadcast::channel(4);
        let job = CrawlJob::new("orphan", vec!["shop.example"]);
        events.send(JobEvent::Stopped(job.clone())).unwrap();

        let result = filter.listen(receiver).await;

        assert!(matches!(result, Err(ScopeError::LifecycleMisuse { .. })));
        drop(events);
    }

    #[tokio::test]
    async fn test_listener_fails_when_events_are_lost() {
        let (filter, _sink) = recording_filter();
        let (events, mut receiver) = broadcast::channel(2);
        let first = CrawlJob::new("first", vec!["shop.example"]);
        let second = CrawlJob::new("second", vec!["shop.example"]);
        let third = CrawlJob::new("third", vec!["shop.example"]);

        events.send(JobEvent::Started(first.clone())).unwrap();
        filter.handle_event(&receiver.recv().await.unwrap()).unwrap();

        events.send(JobEvent::Stopped(first.clone())).unwrap();
        events.send(JobEvent::Started(second)).unwrap();
        events.send(JobEvent::Started(third)).unwrap();

        let result = filter.listen(receiver).await;

        assert!(matches!(result, Err(ScopeError::EventsLagged { skipped: 1 })));
        assert!(filter.is_active(first.id));
        drop(events);
    }
}
