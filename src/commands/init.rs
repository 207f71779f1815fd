//! Initialize a new site

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::Wabisabi;

const DEFAULT_CONFIG: &str = r#"# Site
title: わびさびトレード塾
subtitle: ノイズを排し、本質と向き合う
description: ミニマルなチャート分析を学ぶトレーディング講座
author: クリプトモネダス
language: ja

# URL
url: http://example.com
root: /

# Directory
public_dir: public
store_dir: store
storage_key: wabisabi_posts

# Blog
preview_count: 3
excerpt_length: 100

# Writing
default_author: クリプトモネダス
date_format: "%Y年%-m月%-d日"
image_placeholder: "https://picsum.photos/seed/{seed}/600/400"
untitled_title: 無題の記事

# Marketing sections
hero:
  headline: チャートの静寂
  tagline: インジケーターを削ぎ落とし、相場の本質だけを見る。
  notice: 【第一期生募集】定員20名に達し次第、受付を終了します。

pricing:
  - name: プレミアム対面コース
    location: 大阪本校
    summary: 全カリキュラムを対面で学ぶ最上位コース。
    price: ¥298,000 (税込)
    highlighted: true
    features:
      - 全モジュールの対面講義
      - オンライン教材の全コンテンツ
      - プライベートコミュニティ
  - name: ハイブリッド集中コース
    location: 東京・名古屋
    summary: 対面の集中講座とオンライン学習の組み合わせ。
    price: ¥248,000 (税込)
    features:
      - 1日集中ブートキャンプ
      - オンライン教材の全コンテンツ
  - name: 完全オンラインコース
    location: 全国対応
    summary: 自分のペースで全モジュールを学ぶ。
    price: ¥198,000 (税込)
    features:
      - HDビデオレッスン全5モジュール
      - 独自EMAインジケーター

schedule:
  - location: 大阪本校
    dates:
      - label: 第一期 開講日
        date: 2024年10月5日 (土)
      - label: 申込締切
        date: 2024年9月27日 (金)
  - location: 東京・名古屋
    dates:
      - label: 第一期 集中講座
        date: 2024年11月16日 (土)

testimonials:
  - quote: 画面から指標を減らしただけで、迷いが驚くほど減りました。
    name: Sarah J.
    role: 専業トレーダー
  - quote: 待つことの意味が初めて分かった気がします。
    name: David L.
    role: 兼業FXトレーダー

faq:
  - question: 初心者でも受講できますか？
    answer: はい。最初のモジュールで基礎から丁寧に積み上げます。
  - question: どの市場で使えますか？
    answer: FX、株式、暗号資産、コモディティのいずれにも応用できます。

# Drafting service
gemini:
  endpoint: https://generativelanguage.googleapis.com/v1beta
  model: gemini-2.5-flash
  api_key_env: GEMINI_API_KEY
"#;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    fs::create_dir_all(target_dir)?;

    let config_path = target_dir.join("_config.yml");
    if config_path.exists() {
        tracing::info!("Keeping existing {:?}", config_path);
    } else {
        fs::write(&config_path, DEFAULT_CONFIG)?;
    }

    // Opening a session writes the seed posts into an empty store
    let app = Wabisabi::new(target_dir)?;
    let posts = app.session().posts().len();
    tracing::info!("Store ready with {} posts", posts);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_parses() {
        let config: SiteConfig = serde_yaml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.pricing.len(), 3);
        assert!(config.pricing[0].highlighted);
        assert_eq!(config.schedule[0].dates.len(), 2);
        assert_eq!(config.date_format, "%Y年%-m月%-d日");
    }

    #[test]
    fn test_init_site() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("site");
        init_site(&target).unwrap();
        assert!(target.join("_config.yml").exists());
        assert!(target.join("store/wabisabi_posts.json").exists());

        fs::write(target.join("_config.yml"), "title: Mine\n").unwrap();
        init_site(&target).unwrap();
        assert_eq!(
            fs::read_to_string(target.join("_config.yml")).unwrap(),
            "title: Mine\n"
        );
    }
}
