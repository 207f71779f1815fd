//! Built-in posts used when nothing has been stored yet

use super::Post;

const AUTHOR: &str = "クリプトモネダス";

/// The starter post collection, newest first
pub fn seed_posts() -> Vec<Post> {
    vec![
        Post {
            slug: "silence-on-the-chart".to_string(),
            title: "チャートの静寂に耳を澄ます".to_string(),
            excerpt: "インジケーターを足すほど、相場の声は遠くなる。引き算で見えてくる本質について。"
                .to_string(),
            date: "2024年6月12日".to_string(),
            author: Some(AUTHOR.to_string()),
            tags: vec!["思考法".to_string(), "ミニマリズム".to_string()],
            image_url: "https://picsum.photos/seed/silence/600/400".to_string(),
            content: "## 足し算の罠\n\n\
                多くのトレーダーは、負けるたびに新しいインジケーターを**追加**します。\n\
                しかし画面が賑やかになるほど、判断は*遅く*なります。\n\n\
                ## 引き算の手順\n\n\
                - 使っていない指標を外す\n\
                - 時間足を二つに絞る\n\
                - エントリー条件を一行で書けるまで削る\n\n\
                静かなチャートだけが、静かな判断を生みます。"
                .to_string(),
        },
        Post {
            slug: "ema-as-a-compass".to_string(),
            title: "羅針盤としてのEMA".to_string(),
            excerpt: "移動平均線は未来を予言しない。ただ、今どちらを向いているかを教えてくれる。"
                .to_string(),
            date: "2024年5月28日".to_string(),
            author: Some(AUTHOR.to_string()),
            tags: vec!["テクニカル分析".to_string(), "EMA".to_string()],
            image_url: "https://picsum.photos/seed/compass/600/400".to_string(),
            content: "# 方向を知る\n\n\
                EMAの傾きは、市場参加者の**平均的な気分**です。\n\n\
                ![EMAの傾き](https://picsum.photos/seed/ema/800/400)\n\n\
                価格がEMAの上にある間は、逆らわないこと。それだけで多くの損失は避けられます。"
                .to_string(),
        },
        Post {
            slug: "the-patience-of-wabi".to_string(),
            title: "わびの忍耐、さびの時間".to_string(),
            excerpt: "待つことは何もしないことではない。準備を終えた者だけが、静かに待てる。"
                .to_string(),
            date: "2024年5月3日".to_string(),
            author: Some(AUTHOR.to_string()),
            tags: vec!["心理学".to_string(), "思考法".to_string()],
            image_url: "https://picsum.photos/seed/patience/600/400".to_string(),
            content: "相場で最も難しいのは、*何もしない*ことです。\n\n\
                __待つ__ための条件を決めておけば、待つことは苦痛ではなくなります。"
                .to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::markdown::render;
    use std::collections::HashSet;

    #[test]
    fn test_seed_slugs_are_unique_and_final() {
        let posts = seed_posts();
        let slugs: HashSet<_> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs.len(), posts.len());
        assert!(posts
            .iter()
            .all(|p| !crate::content::is_placeholder(&p.slug)));
    }

    #[test]
    fn test_seed_content_renders() {
        for post in seed_posts() {
            assert!(!render(&post.content).is_empty(), "{}", post.slug);
        }
        let html = render(&seed_posts()[0].content);
        assert!(html.contains("<h2>足し算の罠</h2>"));
        assert!(html.contains("<ul><li>使っていない指標を外す</li>"));
    }
}
