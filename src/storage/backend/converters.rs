use sea_orm::ActiveValue::{NotSet, Set};

use crate::storage::models::{ClickEvent, Link};
use migration::entities::{click, link};

/// 将 Sea-ORM Model 转换为 Link
pub fn model_to_link(model: link::Model) -> Link {
    Link {
        id: model.id,
        alias: model.alias,
        original_url: model.original_url,
        title: model.title,
        description: model.description,
        image_url: model.image_url,
        ios_url: model.ios_url,
        android_url: model.android_url,
        desktop_url: model.desktop_url,
        created_at: model.created_at,
        updated_at: model.updated_at,
        click_count: model.click_count.max(0) as u64,
        is_active: model.is_active,
        expires_at: model.expires_at,
    }
}

/// 将 Link 转换为 ActiveModel（用于插入）
pub fn link_to_active_model(link: &Link) -> link::ActiveModel {
    link::ActiveModel {
        // id is assigned by the store
        id: NotSet,
        alias: Set(link.alias.clone()),
        original_url: Set(link.original_url.clone()),
        title: Set(link.title.clone()),
        description: Set(link.description.clone()),
        image_url: Set(link.image_url.clone()),
        ios_url: Set(link.ios_url.clone()),
        android_url: Set(link.android_url.clone()),
        desktop_url: Set(link.desktop_url.clone()),
        created_at: Set(link.created_at),
        updated_at: Set(link.updated_at),
        click_count: Set(link.click_count as i64),
        is_active: Set(link.is_active),
        expires_at: Set(link.expires_at),
    }
}

/// 将 Sea-ORM Model 转换为 ClickEvent
pub fn model_to_click(model: click::Model) -> ClickEvent {
    ClickEvent {
        id: model.id,
        alias: model.alias,
        ip: model.ip,
        user_agent: model.user_agent,
        referer: model.referer,
        timestamp: model.timestamp,
        browser: model.browser,
        os: model.os,
        device_type: model.device_type,
        is_mobile: model.is_mobile,
        country: model.country,
        city: model.city,
    }
}

pub fn click_to_active_model(event: &ClickEvent) -> click::ActiveModel {
    click::ActiveModel {
        id: Set(event.id.clone()),
        alias: Set(event.alias.clone()),
        ip: Set(event.ip.clone()),
        user_agent: Set(event.user_agent.clone()),
        referer: Set(event.referer.clone()),
        timestamp: Set(event.timestamp),
        browser: Set(event.browser.clone()),
        os: Set(event.os.clone()),
        device_type: Set(event.device_type.clone()),
        is_mobile: Set(event.is_mobile),
        country: Set(event.country.clone()),
        city: Set(event.city.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn create_test_model() -> link::Model {
        link::Model {
            id: 7,
            alias: "abc123".to_string(),
            original_url: "https://example.com".to_string(),
            title: "Example".to_string(),
            description: String::new(),
            image_url: String::new(),
            ios_url: "https://apps.example.com/ios".to_string(),
            android_url: String::new(),
            desktop_url: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            click_count: 42,
            is_active: true,
            expires_at: None,
        }
    }

    #[test]
    fn test_model_to_link_round_trip_fields() {
        let model = create_test_model();
        let link = model_to_link(model.clone());

        assert_eq!(link.id, 7);
        assert_eq!(link.alias, model.alias);
        assert_eq!(link.original_url, model.original_url);
        assert_eq!(link.ios_url, model.ios_url);
        assert_eq!(link.click_count, 42);
        assert!(link.is_active);
    }

    #[test]
    fn test_negative_click_count_clamped() {
        let mut model = create_test_model();
        model.click_count = -5;
        assert_eq!(model_to_link(model).click_count, 0);
    }

    #[test]
    fn test_link_to_active_model_leaves_id_unset() {
        let link = model_to_link(create_test_model());
        let active = link_to_active_model(&link);
        assert_eq!(active.id, NotSet);
    }
}
