//! ffmpeg command options builder.
//!
//! Builds command-line tokens for a stream-copy remux:
//!
//! ```text
//! ffmpeg -hide_banner -nostdin -n -i in.mkv \
//!   -map 0:v:0 -map 0:a:1 -map 0:a:0 -map 0:s:0 \
//!   -c copy -disposition:s:0 -default out.mkv
//! ```
//!
//! Map order is output order. Each selector addresses the source track by
//! type and type-relative index, so reordering never changes which source
//! track a selector points at.

use std::path::Path;

use crate::arrangement::RemapInstruction;
use crate::config::RemuxSettings;
use crate::models::CodecType;

/// Builder for ffmpeg command-line options.
pub struct FfmpegOptionsBuilder<'a> {
    input: &'a Path,
    output: &'a Path,
    instructions: &'a [RemapInstruction],
    settings: &'a RemuxSettings,
}

impl<'a> FfmpegOptionsBuilder<'a> {
    pub fn new(
        input: &'a Path,
        output: &'a Path,
        instructions: &'a [RemapInstruction],
        settings: &'a RemuxSettings,
    ) -> Self {
        Self {
            input,
            output,
            instructions,
            settings,
        }
    }

    /// Build the complete argument list (without the program name).
    pub fn build(&self) -> Vec<String> {
        let mut tokens = Vec::new();

        self.add_global_options(&mut tokens);

        tokens.push("-i".to_string());
        tokens.push(self.input.to_string_lossy().to_string());

        self.add_maps(&mut tokens);

        // Stream copy, no re-encoding
        tokens.push("-c".to_string());
        tokens.push("copy".to_string());

        self.add_dispositions(&mut tokens);

        tokens.push(self.output.to_string_lossy().to_string());

        tokens
    }

    fn add_global_options(&self, tokens: &mut Vec<String>) {
        tokens.push("-hide_banner".to_string());
        tokens.push("-nostdin".to_string());
        tokens.push(if self.settings.overwrite { "-y" } else { "-n" }.to_string());
    }

    fn add_maps(&self, tokens: &mut Vec<String>) {
        for instruction in self.instructions {
            tokens.push("-map".to_string());
            tokens.push(format!("0:{}", instruction.selector()));
        }
    }

    /// Clear the default flag of the first output subtitle.
    fn add_dispositions(&self, tokens: &mut Vec<String>) {
        let has_subtitle = self
            .instructions
            .iter()
            .any(|i| i.codec_type == CodecType::Subtitle);

        if self.settings.clear_subtitle_default && has_subtitle {
            tokens.push("-disposition:s:0".to_string());
            tokens.push("-default".to_string());
        }
    }
}

/// Format tokens for pretty display (one option per line).
pub fn format_tokens_pretty(tokens: &[String]) -> String {
    let mut result = String::new();
    let mut i = 0;

    while i < tokens.len() {
        let token = &tokens[i];
        let takes_value = token.starts_with("-disposition")
            || (token.starts_with('-') && i + 1 < tokens.len() && !tokens[i + 1].starts_with('-'));

        if takes_value && i + 1 < tokens.len() {
            result.push_str(&format!("{} {} \\\n", token, tokens[i + 1]));
            i += 2;
        } else if i + 1 == tokens.len() {
            result.push_str(&format!("{}\n", token));
            i += 1;
        } else {
            result.push_str(&format!("{} \\\n", token));
            i += 1;
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn instr(slot: usize, codec_type: CodecType, rel: usize) -> RemapInstruction {
        RemapInstruction {
            slot,
            codec_type,
            type_relative_index: rel,
        }
    }

    fn build(instructions: &[RemapInstruction], settings: &RemuxSettings) -> Vec<String> {
        let input = PathBuf::from("/test/in.mkv");
        let output = PathBuf::from("/test/in_remux.mkv");
        FfmpegOptionsBuilder::new(&input, &output, instructions, settings).build()
    }

    fn maps(tokens: &[String]) -> Vec<String> {
        tokens
            .windows(2)
            .filter(|w| w[0] == "-map")
            .map(|w| w[1].clone())
            .collect()
    }

    #[test]
    fn maps_follow_instruction_order() {
        let instructions = [
            instr(0, CodecType::Video, 0),
            instr(1, CodecType::Audio, 1),
            instr(2, CodecType::Audio, 0),
            instr(3, CodecType::Subtitle, 0),
        ];
        let tokens = build(&instructions, &RemuxSettings::default());

        assert_eq!(maps(&tokens), vec!["0:v:0", "0:a:1", "0:a:0", "0:s:0"]);
        assert!(tokens.windows(2).any(|w| w[0] == "-c" && w[1] == "copy"));
        assert_eq!(tokens.last().map(String::as_str), Some("/test/in_remux.mkv"));
        assert!(tokens.windows(2).any(|w| w[0] == "-i" && w[1] == "/test/in.mkv"));
    }

    #[test]
    fn clears_first_subtitle_default() {
        let instructions = [instr(0, CodecType::Video, 0), instr(1, CodecType::Subtitle, 2)];
        let tokens = build(&instructions, &RemuxSettings::default());
        assert!(tokens
            .windows(2)
            .any(|w| w[0] == "-disposition:s:0" && w[1] == "-default"));
    }

    #[test]
    fn no_disposition_without_subtitles_or_when_disabled() {
        let video_only = [instr(0, CodecType::Video, 0)];
        let tokens = build(&video_only, &RemuxSettings::default());
        assert!(!tokens.iter().any(|t| t.starts_with("-disposition")));

        let settings = RemuxSettings {
            clear_subtitle_default: false,
            ..RemuxSettings::default()
        };
        let with_subs = [instr(0, CodecType::Subtitle, 0)];
        let tokens = build(&with_subs, &settings);
        assert!(!tokens.iter().any(|t| t.starts_with("-disposition")));
    }

    #[test]
    fn overwrite_flag() {
        let tokens = build(&[], &RemuxSettings::default());
        assert!(tokens.contains(&"-n".to_string()));

        let settings = RemuxSettings {
            overwrite: true,
            ..RemuxSettings::default()
        };
        let tokens = build(&[], &settings);
        assert!(tokens.contains(&"-y".to_string()));
        assert!(!tokens.contains(&"-n".to_string()));
    }

    #[test]
    fn pretty_format_pairs_options() {
        let tokens = build(
            &[instr(0, CodecType::Subtitle, 0)],
            &RemuxSettings::default(),
        );
        let pretty = format_tokens_pretty(&tokens);

        assert!(pretty.contains("-map 0:s:0 \\\n"));
        assert!(pretty.contains("-disposition:s:0 -default \\\n"));
        assert!(pretty.ends_with("/test/in_remux.mkv\n"));
    }
}
