//! Paged, date-filtered point report.

mod common;

use chrono::Duration;
use uuid::Uuid;

use pvz::contract::model::{ProductType, ReportFilter, ReportQuery};

use common::{harnesses, start_time, Harness};

async fn seed_points(h: &Harness, n: usize) -> Vec<Uuid> {
    let mut ids = Vec::with_capacity(n);
    for _ in 0..n {
        ids.push(h.service.create_point("Москва").await.unwrap().id);
        h.clock.advance(Duration::seconds(1));
    }
    ids
}

fn page(page: Option<i64>, limit: Option<i64>) -> ReportQuery {
    ReportQuery {
        filter: ReportFilter::default(),
        page,
        limit,
    }
}

#[tokio::test]
async fn second_page_starts_at_offset_ten() {
    for h in harnesses().await {
        let ids = seed_points(&h, 25).await;

        let report = h
            .service
            .list_points_extended(page(Some(2), Some(10)))
            .await
            .unwrap();
        let got: Vec<Uuid> = report.iter().map(|r| r.point.id).collect();
        assert_eq!(got, ids[10..20].to_vec(), "{}", h.name);

        let last = h
            .service
            .list_points_extended(page(Some(3), Some(10)))
            .await
            .unwrap();
        assert_eq!(last.len(), 5, "{}", h.name);

        let beyond = h
            .service
            .list_points_extended(page(Some(9), Some(10)))
            .await
            .unwrap();
        assert!(beyond.is_empty(), "{}", h.name);
    }
}

#[tokio::test]
async fn non_positive_page_and_limit_use_defaults() {
    for h in harnesses().await {
        let ids = seed_points(&h, 12).await;

        for query in [page(Some(0), Some(0)), page(Some(-1), Some(-10)), page(None, None)] {
            let report = h.service.list_points_extended(query).await.unwrap();
            let got: Vec<Uuid> = report.iter().map(|r| r.point.id).collect();
            assert_eq!(got, ids[..10].to_vec(), "{}", h.name);
        }
    }
}

#[tokio::test]
async fn points_without_receptions_are_listed_with_empty_lists() {
    for h in harnesses().await {
        let ids = seed_points(&h, 2).await;
        h.service.open_reception(ids[1]).await.unwrap();

        let report = h.service.list_points_extended(page(None, None)).await.unwrap();
        assert_eq!(report.len(), 2);
        assert!(report[0].receptions.is_empty(), "{}", h.name);
        assert_eq!(report[1].receptions.len(), 1);
        assert!(report[1].receptions[0].products.is_empty(), "{}", h.name);
    }
}

#[tokio::test]
async fn date_filter_narrows_receptions_not_points() {
    for h in harnesses().await {
        let point = h.service.create_point("Санкт-Петербург").await.unwrap();

        // Three receptions one hour apart, each with one product.
        let mut receptions = Vec::new();
        for _ in 0..3 {
            h.clock.advance(Duration::hours(1));
            let r = h.service.open_reception(point.id).await.unwrap();
            h.service.add_product(point.id, ProductType::Shoes).await.unwrap();
            h.service.close_last_reception(point.id).await.unwrap();
            receptions.push(r);
        }

        let query = ReportQuery {
            filter: ReportFilter {
                date_from: Some(receptions[1].created_at),
                date_to: Some(receptions[2].created_at),
            },
            page: None,
            limit: None,
        };
        let report = h.service.list_points_extended(query).await.unwrap();
        assert_eq!(report.len(), 1);
        let ids: Vec<Uuid> = report[0].receptions.iter().map(|r| r.reception.id).collect();
        assert_eq!(ids, vec![receptions[1].id, receptions[2].id], "{}", h.name);
        assert!(report[0]
            .receptions
            .iter()
            .all(|r| r.products.len() == 1));

        let before_any = ReportQuery {
            filter: ReportFilter {
                date_from: None,
                date_to: Some(start_time()),
            },
            page: None,
            limit: None,
        };
        let report = h.service.list_points_extended(before_any).await.unwrap();
        assert_eq!(report.len(), 1, "{}", h.name);
        assert!(report[0].receptions.is_empty(), "{}", h.name);
    }
}

#[tokio::test]
async fn list_points_returns_every_point_in_creation_order() {
    for h in harnesses().await {
        let ids = seed_points(&h, 15).await;
        let points = h.service.list_points().await.unwrap();
        let got: Vec<Uuid> = points.iter().map(|p| p.id).collect();
        assert_eq!(got, ids, "{}", h.name);
    }
}
