use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use notifier_domain::models::{Contact, IntegrationKind, NotificationTarget, RecipientAddress};
use notifier_domain::repositories::ContactDirectory;
use notifier_domain::{NotifierError, NotifierResult};

/// 扇出解析器：把一个逻辑通知目标展开为一到多个物理投递地址。
///
/// generic/sophia集成恒为单地址（目标配置的URL）；contact_fanout按
/// 选中的联系人逐个解析。目录中不存在的ID与缺少电话号码的联系人
/// 跳过并记录，不中断整个扇出；过滤后为空集则返回配置错误，
/// 调用方在任何网络活动之前同步收到该错误。
pub struct FanoutResolver {
    directory: Arc<dyn ContactDirectory>,
}

impl FanoutResolver {
    pub fn new(directory: Arc<dyn ContactDirectory>) -> Self {
        Self { directory }
    }

    pub async fn resolve(
        &self,
        target: &NotificationTarget,
    ) -> NotifierResult<Vec<RecipientAddress>> {
        match target.integration_kind {
            IntegrationKind::Generic | IntegrationKind::Sophia => {
                let url = target.endpoint_url.as_deref().unwrap_or("").trim();
                if url.is_empty() {
                    return Err(NotifierError::config_error(format!(
                        "通知目标 {} 缺少端点URL",
                        target.name
                    )));
                }
                Ok(vec![RecipientAddress::Url(url.to_string())])
            }
            IntegrationKind::ContactFanout => self.resolve_contacts(target).await,
        }
    }

    async fn resolve_contacts(
        &self,
        target: &NotificationTarget,
    ) -> NotifierResult<Vec<RecipientAddress>> {
        // 三种上游编码在此统一归一化，歧义不允许泄漏到解析边界之外
        let ids = target.recipients.normalize();
        if ids.is_empty() {
            return Err(NotifierError::config_error(format!(
                "通知目标 {} 未选择任何收件联系人",
                target.name
            )));
        }

        let contacts: HashMap<i64, Contact> = self
            .directory
            .get_by_ids(&ids)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        let mut recipients = Vec::new();
        for id in &ids {
            let Some(contact) = contacts.get(id) else {
                warn!("联系人 {} 在目录中不存在，跳过", id);
                continue;
            };
            if !contact.has_deliverable_address() {
                warn!(
                    "联系人 {} ({}) 没有可用的电话号码，跳过本次投递",
                    contact.id, contact.name
                );
                continue;
            }
            recipients.push(RecipientAddress::Contact {
                contact_id: contact.id,
                address: contact.phone.clone().unwrap_or_default(),
                name: contact.name.clone(),
            });
        }

        if recipients.is_empty() {
            return Err(NotifierError::config_error(format!(
                "通知目标 {} 没有可用的收件方",
                target.name
            )));
        }

        debug!(
            "目标 {} 解析出 {} 个收件方（选中 {} 个）",
            target.name,
            recipients.len(),
            ids.len()
        );

        Ok(recipients)
    }
}
