//! LocalStorage 封装模块
//!
//! 基于 `gloo-storage`。原始字符串（如 token）直接读写，
//! 结构化数据以 JSON 存储。

use gloo_storage::{LocalStorage as GlooStorage, Storage};
use serde::{Serialize, de::DeserializeOwned};

/// 本地存储操作封装
///
/// 提供静态方法访问浏览器 LocalStorage API。
pub struct LocalStorage;

impl LocalStorage {
    /// 获取存储的原始字符串值
    ///
    /// 键不存在或发生错误时返回 `None`
    pub fn get(key: &str) -> Option<String> {
        GlooStorage::raw().get_item(key).ok().flatten()
    }

    /// 设置原始字符串值，成功返回 `true`
    pub fn set(key: &str, value: &str) -> bool {
        GlooStorage::raw().set_item(key, value).is_ok()
    }

    /// 读取 JSON 值；内容损坏时视为不存在
    pub fn get_json<T: DeserializeOwned>(key: &str) -> Option<T> {
        match GlooStorage::get::<T>(key) {
            Ok(value) => Some(value),
            Err(gloo_storage::errors::StorageError::KeyNotFound(_)) => None,
            Err(e) => {
                log::warn!("[Storage] discarding unreadable value for {key}: {e}");
                None
            }
        }
    }

    pub fn set_json<T: Serialize>(key: &str, value: &T) -> bool {
        match GlooStorage::set(key, value) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("[Storage] failed to write {key}: {e}");
                false
            }
        }
    }

    /// 删除存储的键值对
    pub fn delete(key: &str) {
        GlooStorage::delete(key);
    }
}
