pub mod waterfall_panel;
